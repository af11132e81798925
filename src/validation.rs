use garde::Validate;
use serde::Serialize;

#[derive(Validate, Clone, Serialize, Debug, PartialEq)]
pub struct ValidatedEmail(
    #[garde(email)]
    pub(crate) String
);

impl ValidatedEmail {
    pub fn parse(s: &str) -> anyhow::Result<Self> {
        let email = ValidatedEmail(s.trim().to_string());
        email.validate()?;
        Ok(email)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ValidatedEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
