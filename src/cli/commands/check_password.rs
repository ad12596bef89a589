//! Check-password command handler

use crate::services::password_policy::validate_password;

pub fn cmd_check_password(password: &str) -> anyhow::Result<()> {
    match validate_password(password) {
        Ok(()) => {
            println!("✓ Password satisfies the policy");
            Ok(())
        }
        Err(violation) => {
            println!("✗ {}", violation);
            Err(violation.into())
        }
    }
}
