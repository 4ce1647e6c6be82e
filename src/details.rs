/// Structured-text parsing for job-application notes

const COMPANY_PREFIX: &str = "hiring company:";
const ROLE_PREFIX: &str = "job role(s) & experience:";
const ACTIONS_PREFIX: &str = "primary application action(s):";
const CONTACT_PREFIX: &str = "key contact for application:";
const LOCATION_PREFIX: &str = "location:";
const ACTION_ITEM_PREFIX: &str = "action:";
const BULLET_PREFIX: &str = "- ";

/// Fields extracted from a note's free-form text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedDetails {
    pub company: String,
    pub role_and_exp: String,
    pub actions: Vec<String>,
    pub contact: String,
    pub location: String,
    pub raw: String,
    pub has_structured_data: bool,
}

#[derive(Clone, Copy, PartialEq)]
enum Section {
    None,
    Actions,
}

/// Parse loosely labeled text into its known fields
///
/// Algorithm:
/// 1. Walk lines in order, trimming each
/// 2. A recognized header (case-insensitive) fills its field with the rest of the line
/// 3. The actions header switches into actions mode; any other header leaves it
/// 4. In actions mode, `action:` and `- ` lines append to the action list
/// 5. Everything else is ignored
///
/// Example:
/// - "Hiring Company: Acme\nLocation: NYC" → company "Acme", location "NYC"
pub fn parse_structured_text(text: &str) -> ParsedDetails {
    let mut details = ParsedDetails {
        raw: text.to_string(),
        ..ParsedDetails::default()
    };

    if text.trim().is_empty() {
        return details;
    }

    let mut section = Section::None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(value) = strip_prefix_ci(line, COMPANY_PREFIX) {
            details.company = value.to_string();
            details.has_structured_data = true;
            section = Section::None;
        } else if let Some(value) = strip_prefix_ci(line, ROLE_PREFIX) {
            details.role_and_exp = value.to_string();
            details.has_structured_data = true;
            section = Section::None;
        } else if let Some(value) = strip_prefix_ci(line, ACTIONS_PREFIX) {
            // Inline content after the header counts as the first action
            if !value.is_empty() {
                details.actions.push(value.to_string());
            }
            details.has_structured_data = true;
            section = Section::Actions;
        } else if let Some(value) = strip_prefix_ci(line, CONTACT_PREFIX) {
            details.contact = value.to_string();
            details.has_structured_data = true;
            section = Section::None;
        } else if let Some(value) = strip_prefix_ci(line, LOCATION_PREFIX) {
            details.location = value.to_string();
            details.has_structured_data = true;
            section = Section::None;
        } else if section == Section::Actions {
            let item = strip_prefix_ci(line, ACTION_ITEM_PREFIX)
                .or_else(|| strip_prefix_ci(line, BULLET_PREFIX));
            if let Some(item) = item {
                if !item.is_empty() {
                    details.actions.push(item.to_string());
                }
            }
        }
    }

    details
}

/// Strip an ASCII prefix case-insensitively, returning the trimmed remainder
fn strip_prefix_ci<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let head = line.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(line[prefix.len()..].trim())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_example() {
        let text = "Hiring Company: Acme\nLocation: NYC\nPrimary Application Action(s):\n- Apply at acme.com\nAction: Email hr@acme.com";
        let parsed = parse_structured_text(text);

        assert_eq!(parsed.company, "Acme");
        assert_eq!(parsed.location, "NYC");
        assert_eq!(parsed.actions, vec!["Apply at acme.com", "Email hr@acme.com"]);
        assert!(parsed.has_structured_data);
        assert_eq!(parsed.raw, text);
    }

    #[test]
    fn test_parse_unstructured_text() {
        let text = "Just a note about a job\nwith no labels";
        let parsed = parse_structured_text(text);

        assert!(!parsed.has_structured_data);
        assert_eq!(parsed.raw, text);
        assert_eq!(parsed.company, "");
        assert_eq!(parsed.role_and_exp, "");
        assert_eq!(parsed.contact, "");
        assert_eq!(parsed.location, "");
        assert!(parsed.actions.is_empty());
    }

    #[test]
    fn test_parse_empty_input() {
        let parsed = parse_structured_text("");
        assert_eq!(parsed, ParsedDetails::default());

        let parsed = parse_structured_text("   \n  ");
        assert!(!parsed.has_structured_data);
        assert_eq!(parsed.raw, "   \n  ");
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        let parsed = parse_structured_text(
            "HIRING COMPANY:   Globex  \njob ROLE(S) & experience: Senior Rust Engineer, 5+ yrs\nKEY CONTACT FOR APPLICATION: Jane <jane@globex.io>",
        );

        assert_eq!(parsed.company, "Globex");
        assert_eq!(parsed.role_and_exp, "Senior Rust Engineer, 5+ yrs");
        assert_eq!(parsed.contact, "Jane <jane@globex.io>");
    }

    #[test]
    fn test_bullets_outside_actions_section_ignored() {
        let parsed = parse_structured_text(
            "- stray bullet\nPrimary Application Action(s):\n- Apply online\nLocation: Remote\n- after location",
        );

        assert_eq!(parsed.actions, vec!["Apply online"]);
        assert_eq!(parsed.location, "Remote");
    }

    #[test]
    fn test_actions_header_with_inline_action() {
        let parsed = parse_structured_text(
            "Primary Application Action(s): Apply via https://jobs.example.com\n- Follow up in a week",
        );

        assert_eq!(
            parsed.actions,
            vec!["Apply via https://jobs.example.com", "Follow up in a week"]
        );
    }

    #[test]
    fn test_unrecognized_lines_in_actions_section_ignored() {
        let parsed = parse_structured_text(
            "Primary Application Action(s):\nsome commentary\n- Send resume",
        );

        assert_eq!(parsed.actions, vec!["Send resume"]);
    }

    #[test]
    fn test_non_ascii_line_does_not_panic() {
        let parsed = parse_structured_text("é\nLocation: Zürich");
        assert_eq!(parsed.location, "Zürich");
    }
}
