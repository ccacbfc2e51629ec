#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NameParts {
    pub last: String,
    pub first: String,
    pub middle: String,
}

/// Joins the non-empty, trimmed parts with single spaces.
pub fn build_full_name(last: &str, first: &str, middle: &str) -> String {
    [last, first, middle]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// First token is the last name, second the first name, the rest the middle
/// name. Surnames containing a space do not survive the round trip.
pub fn split_full_name(full_name: &str) -> NameParts {
    let mut tokens = full_name.split_whitespace();
    let last = tokens.next().unwrap_or_default().to_string();
    let first = tokens.next().unwrap_or_default().to_string();
    let middle = tokens.collect::<Vec<_>>().join(" ");
    NameParts {
        last,
        first,
        middle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_skips_empty_parts() {
        assert_eq!(build_full_name("Ivanov", "Ivan", ""), "Ivanov Ivan");
        assert_eq!(build_full_name(" Ivanov ", "", " Petrovich"), "Ivanov Petrovich");
        assert_eq!(build_full_name("", "  ", ""), "");
    }

    #[test]
    fn split_three_parts() {
        assert_eq!(
            split_full_name("Ivanov Ivan Petrovich"),
            NameParts {
                last: "Ivanov".into(),
                first: "Ivan".into(),
                middle: "Petrovich".into(),
            }
        );
    }

    #[test]
    fn split_single_token() {
        assert_eq!(
            split_full_name("Ivanov"),
            NameParts {
                last: "Ivanov".into(),
                ..NameParts::default()
            }
        );
        assert_eq!(split_full_name("   "), NameParts::default());
    }

    #[test]
    fn split_collapses_whitespace_into_middle_name() {
        let parts = split_full_name("  Karimov   Aziz  Bek   ogli ");
        assert_eq!(parts.last, "Karimov");
        assert_eq!(parts.first, "Aziz");
        assert_eq!(parts.middle, "Bek ogli");
    }
}
