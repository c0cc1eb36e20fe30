use std::fmt;

/// Output class of the spam classifier. Class index 1 is spam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpamLabel {
    Spam,
    Ham,
}

impl SpamLabel {
    pub fn from_class_index(index: u8) -> Self {
        if index == 1 { Self::Spam } else { Self::Ham }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpamLabel::Spam => "spam",
            SpamLabel::Ham => "ham",
        }
    }

    pub fn verdict_message(&self) -> &'static str {
        match self {
            SpamLabel::Spam => "This email is **Spam**!",
            SpamLabel::Ham => "This email is **Ham**!",
        }
    }
}

impl fmt::Display for SpamLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
