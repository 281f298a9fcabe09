//! The ordered rule tables of the pattern and substring tiers.

use personafill_protocols::ProfileAttribute;
use regex::Regex;

use ProfileAttribute::*;

/// Pattern tier table, in evaluation order.
const PATTERNS: &[(ProfileAttribute, &str)] = &[
    (FirstName, r"first.*name|fname|given.*name|initials|first$|first\s*name"),
    (LastName, r"last.*name|lname|surname|family.*name|last$|second.*name|last\s*name"),
    (Email, r"e[-._]?mail|email.*address"),
    (Phone, r"phone|mobile|cell|telephone|tel$|contact.*number|phone.*number"),
    (Address, r"address|addr|street|location|home.*address"),
    (Company, r"company|organization|employer|workplace|business"),
    (JobTitle, r"job.*title|position|role|occupation|title"),
    (Linkedin, r"linkedin|linked.*in"),
    (Github, r"github|git.*hub"),
    (Website, r"website|site|url|web.*site"),
    (Skills, r"skill|expertise|competency|ability"),
    (Experience, r"experience|work.*history|employment"),
    (Education, r"education|academic|degree|school|university|qualification"),
    (Bio, r"bio|biography|about|description"),
    (FullName, r"full.*name|applicant.*name|your\s*name|^\s*name\b"),
    (City, r"city|town"),
    (State, r"state|province|region"),
    (ZipCode, r"zip|postal|post\s*code"),
    (Country, r"country|nation"),
    (Portfolio, r"portfolio"),
    (CoverLetter, r"cover.*letter|application.*letter|motivation"),
    (ResumeUrl, r"resume|r[ée]sum[ée]|\bcv\b"),
    (CardNumber, r"card.*number|cc.*number|cc_?num|credit.*card"),
    (CardHolder, r"card.*holder|name.*on.*card|cardholder"),
    (ExpiryDate, r"expir|exp.*date|valid.*thru|mm\s*/\s*yy"),
    (Cvv, r"cvv|cvc|security.*code|card.*code"),
];

/// One entry of the pattern tier.
#[derive(Debug, Clone)]
pub struct MatchRule {
    pub attribute: ProfileAttribute,
    pattern: Regex,
}

impl MatchRule {
    pub fn new(attribute: ProfileAttribute, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            attribute,
            pattern: Regex::new(pattern)?,
        })
    }

    pub fn is_match(&self, search_text: &str) -> bool {
        self.pattern.is_match(search_text)
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

/// Compile the pattern tier.
pub fn pattern_rules() -> Result<Vec<MatchRule>, regex::Error> {
    PATTERNS
        .iter()
        .map(|(attribute, pattern)| MatchRule::new(*attribute, pattern))
        .collect()
}

/// One entry of the substring tier.
#[derive(Debug, Clone, Copy)]
pub struct SubstringRule {
    pub attribute: ProfileAttribute,
    test: fn(&str) -> bool,
}

impl SubstringRule {
    pub fn is_match(&self, text: &str) -> bool {
        (self.test)(text)
    }
}

fn first_name_family(text: &str) -> bool {
    (text.contains("first") && text.contains("name"))
        || text.contains("fname")
        || (text.contains("name")
            && !text.contains("last")
            && !text.contains("email")
            && !text.contains("phone"))
}

fn email_family(text: &str) -> bool {
    text.contains("email")
}

fn phone_family(text: &str) -> bool {
    ["phone", "mobile", "cell", "tel"]
        .iter()
        .any(|token| text.contains(token))
}

/// Substring tier, in evaluation order. Texts are expected lower-cased.
pub const SUBSTRING_RULES: [SubstringRule; 3] = [
    SubstringRule {
        attribute: FirstName,
        test: first_name_family,
    },
    SubstringRule {
        attribute: Email,
        test: email_family,
    },
    SubstringRule {
        attribute: Phone,
        test: phone_family,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn first_match(text: &str) -> Option<ProfileAttribute> {
        pattern_rules()
            .unwrap()
            .into_iter()
            .find(|rule| rule.is_match(text))
            .map(|rule| rule.attribute)
    }

    #[test]
    fn test_every_attribute_has_exactly_one_pattern() {
        let rules = pattern_rules().unwrap();
        assert_eq!(rules.len(), ProfileAttribute::ALL.len());
        for attribute in ProfileAttribute::ALL {
            assert_eq!(
                rules.iter().filter(|r| r.attribute == attribute).count(),
                1,
                "{}",
                attribute
            );
        }
    }

    #[test]
    fn test_declared_order_breaks_ties() {
        assert_eq!(first_match("email address"), Some(Email));
        assert_eq!(first_match("given name"), Some(FirstName));
        assert_eq!(first_match("surname"), Some(LastName));
        assert_eq!(first_match("job title"), Some(JobTitle));
        assert_eq!(first_match("linkedin profile url"), Some(Linkedin));
    }

    #[test]
    fn test_contact_number_is_phone() {
        assert_eq!(first_match("contact number"), Some(Phone));
        assert_eq!(first_match("e-mail"), Some(Email));
        assert_eq!(first_match("mobile"), Some(Phone));
    }

    #[test]
    fn test_supplemented_patterns() {
        assert_eq!(first_match("full name"), Some(FullName));
        assert_eq!(first_match("zip"), Some(ZipCode));
        assert_eq!(first_match("postal code"), Some(ZipCode));
        assert_eq!(first_match("cvc"), Some(Cvv));
        assert_eq!(first_match("upload cv"), Some(ResumeUrl));
        assert_eq!(first_match("nothing to see"), None);
    }

    #[test]
    fn test_substring_families() {
        assert!(first_name_family("your name"));
        assert!(first_name_family("fname"));
        assert!(!first_name_family("last name"));
        assert!(!first_name_family("email name"));
        assert!(email_family("work email"));
        assert!(phone_family("tel"));
        assert!(phone_family("cell"));
        assert!(!phone_family("number"));
    }
}
