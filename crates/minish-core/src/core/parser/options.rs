//! Option/argument splitting.

use std::collections::HashMap;

use crate::core::error::OptionError;

/// Parsed options, keyed with their leading dashes.
pub type Options = HashMap<String, Option<String>>;

/// Split words into options and positional arguments.
///
/// Options are read from the front while words start with `-`:
/// - `--name` / `--name=value` set a long option
/// - `-x=value` sets a single short option to a value
/// - `-xyz` sets `-x`, `-y` and `-z` with no value
///
/// A bare `--` is dropped and ends option parsing; a lone `-` or the first
/// word without a dash ends it too and is kept as an argument.
pub fn parse_options(words: &[String]) -> Result<(Options, Vec<String>), OptionError> {
    let mut options = Options::new();
    let mut rest = words;

    while let Some((word, tail)) = rest.split_first() {
        if word == "--" {
            rest = tail;
            break;
        }
        if word == "-" || !word.starts_with('-') {
            break;
        }

        if let Some(long) = word.strip_prefix("--") {
            let (name, value) = split_value(long);
            if name.is_empty() {
                return Err(OptionError::EmptyOptionName(word.clone()));
            }
            options.insert(format!("--{name}"), value);
        } else {
            let short = &word[1..];
            let (flags, value) = split_value(short);
            if flags.is_empty() {
                return Err(OptionError::EmptyOptionName(word.clone()));
            }
            match value {
                Some(value) => {
                    if flags.chars().count() > 1 {
                        return Err(OptionError::ValueForBundledFlags {
                            flags: flags.to_string(),
                        });
                    }
                    options.insert(format!("-{flags}"), Some(value));
                }
                None => {
                    for flag in flags.chars() {
                        options.insert(format!("-{flag}"), None);
                    }
                }
            }
        }
        rest = tail;
    }

    Ok((options, rest.to_vec()))
}

fn split_value(body: &str) -> (&str, Option<String>) {
    match body.split_once('=') {
        Some((name, value)) => (name, Some(value.to_string())),
        None => (body, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(input: &[&str]) -> Vec<String> {
        input.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_options() {
        let (options, args) = parse_options(&words(&["a", "b"])).unwrap();
        assert!(options.is_empty());
        assert_eq!(args, vec!["a", "b"]);
    }

    #[test]
    fn test_bundled_short_flags() {
        let (options, args) = parse_options(&words(&["-la", "dir"])).unwrap();
        assert_eq!(options.get("-l"), Some(&None));
        assert_eq!(options.get("-a"), Some(&None));
        assert_eq!(args, vec!["dir"]);
    }

    #[test]
    fn test_short_flag_with_value() {
        let (options, _) = parse_options(&words(&["-n=5"])).unwrap();
        assert_eq!(options.get("-n"), Some(&Some("5".to_string())));
    }

    #[test]
    fn test_value_for_bundled_flags_fails() {
        assert_eq!(
            parse_options(&words(&["-ab=1"])),
            Err(OptionError::ValueForBundledFlags {
                flags: "ab".to_string()
            })
        );
    }

    #[test]
    fn test_long_options() {
        let (options, args) =
            parse_options(&words(&["--recursive", "--depth=2", "x"])).unwrap();
        assert_eq!(options.get("--recursive"), Some(&None));
        assert_eq!(options.get("--depth"), Some(&Some("2".to_string())));
        assert_eq!(args, vec!["x"]);
    }

    #[test]
    fn test_value_may_be_empty_or_contain_equals() {
        let (options, _) = parse_options(&words(&["--eq=a=b", "-e="])).unwrap();
        assert_eq!(options.get("--eq"), Some(&Some("a=b".to_string())));
        assert_eq!(options.get("-e"), Some(&Some(String::new())));
    }

    #[test]
    fn test_double_dash_ends_options() {
        let (options, args) = parse_options(&words(&["-r", "--", "-f", "x"])).unwrap();
        assert_eq!(options.len(), 1);
        assert_eq!(args, vec!["-f", "x"]);
    }

    #[test]
    fn test_first_argument_ends_options() {
        let (options, args) = parse_options(&words(&["a", "-r"])).unwrap();
        assert!(options.is_empty());
        assert_eq!(args, vec!["a", "-r"]);
    }

    #[test]
    fn test_lone_dash_is_argument() {
        let (options, args) = parse_options(&words(&["-v", "-", "-x"])).unwrap();
        assert_eq!(options.len(), 1);
        assert_eq!(args, vec!["-", "-x"]);
    }

    #[test]
    fn test_empty_option_names() {
        assert_eq!(
            parse_options(&words(&["--=x"])),
            Err(OptionError::EmptyOptionName("--=x".to_string()))
        );
        assert_eq!(
            parse_options(&words(&["-=x"])),
            Err(OptionError::EmptyOptionName("-=x".to_string()))
        );
    }
}
