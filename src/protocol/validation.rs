//! Validation for the small set of fields the orchestrator accepts directly
//! from clients. Identity (`hostId`/`userId`) is never validated beyond
//! non-emptiness: the core does not authenticate users.

/// Room membership names are the one place with a real invariant: no two
/// members of the same room share the same name.
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Name cannot be empty");
    }
    if name.len() > 64 {
        return Err("Name is too long (max 64 characters)");
    }
    Ok(())
}

pub fn validate_user_id(user_id: &str) -> Result<(), &'static str> {
    if user_id.trim().is_empty() {
        return Err("User id cannot be empty");
    }
    Ok(())
}

pub fn validate_room_id(room_id: &str) -> Result<(), &'static str> {
    if room_id.trim().is_empty() {
        return Err("Room id cannot be empty");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_name() {
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
    }

    #[test]
    fn accepts_reasonable_name() {
        assert!(validate_name("Alice").is_ok());
    }

    #[test]
    fn rejects_overlong_name() {
        let long = "a".repeat(65);
        assert!(validate_name(&long).is_err());
    }
}
