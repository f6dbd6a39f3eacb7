//! Account profile.

use std::fmt::Write as _;

use simplemart_core::UserProfile;
use simplemart_storefront::error::AppError;
use simplemart_storefront::state::AppState;

/// Print the profile for `id`.
///
/// # Errors
///
/// Returns an error if the profile does not exist or could not be fetched.
pub async fn show(state: &AppState, id: i64) -> Result<(), AppError> {
    let profile = state.catalog().user(id).await.map_err(AppError::Profile)?;
    print!("{}", render(&profile));
    Ok(())
}

fn render(profile: &UserProfile) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[{}] {}", profile.name.initials(), profile.name.full());
    let _ = writeln!(out, "Username: {}", profile.username);
    let _ = writeln!(out, "Email:    {}", profile.email);
    if !profile.phone.is_empty() {
        let _ = writeln!(out, "Phone:    {}", profile.phone);
    }
    let address = profile
        .address
        .as_ref()
        .map(simplemart_core::Address::single_line)
        .unwrap_or_default();
    if !address.is_empty() {
        let _ = writeln!(out, "Address:  {address}");
    }
    out
}

#[cfg(test)]
mod tests {
    use simplemart_core::{Address, PersonName};

    use super::*;

    fn profile() -> UserProfile {
        UserProfile {
            id: 1,
            username: "johnd".to_string(),
            email: "john@gmail.com".to_string(),
            name: PersonName {
                firstname: "john".to_string(),
                lastname: "doe".to_string(),
            },
            phone: "1-570-236-7033".to_string(),
            address: Some(Address {
                number: Some(7682),
                street: "new road".to_string(),
                city: "kilcoole".to_string(),
                zipcode: "12926-3874".to_string(),
            }),
        }
    }

    #[test]
    fn test_render_profile() {
        let text = render(&profile());
        assert!(text.starts_with("[JD] john doe\n"));
        assert!(text.contains("Username: johnd\n"));
        assert!(text.contains("Email:    john@gmail.com\n"));
        assert!(text.contains("Phone:    1-570-236-7033\n"));
        assert!(text.contains("Address:  7682 new road, kilcoole, 12926-3874\n"));
    }

    #[test]
    fn test_render_skips_missing_contact_details() {
        let mut profile = profile();
        profile.phone.clear();
        profile.address = None;
        let text = render(&profile);
        assert!(!text.contains("Phone:"));
        assert!(!text.contains("Address:"));
    }
}
