use std::collections::{BTreeMap, HashMap};

/// Where a redirected output stream ends up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RedirectTarget {
    /// `>`: truncate the file, then write.
    Write(String),
    /// `>>`: append to the file.
    Append(String),
}

impl RedirectTarget {
    pub fn path(&self) -> &str {
        match self {
            Self::Write(path) | Self::Append(path) => path,
        }
    }

    pub fn is_append(&self) -> bool {
        matches!(self, Self::Append(_))
    }
}

/// A fully parsed command line: name, options, positional arguments and redirects.
///
/// Option keys keep their dashes (`-r`, `--recursive`). A flag without a value
/// maps to `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputArgs {
    command: String,
    options: HashMap<String, Option<String>>,
    args: Vec<String>,
    redirects: BTreeMap<u32, RedirectTarget>,
}

impl InputArgs {
    pub fn new(
        command: impl Into<String>,
        options: HashMap<String, Option<String>>,
        args: Vec<String>,
        redirects: BTreeMap<u32, RedirectTarget>,
    ) -> Self {
        Self {
            command: command.into(),
            options,
            args,
            redirects,
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn argc(&self) -> usize {
        self.args.len()
    }

    /// A copy of the option map.
    pub fn options(&self) -> HashMap<String, Option<String>> {
        self.options.clone()
    }

    pub fn has_option(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }

    pub fn has_any_option(&self, keys: &[&str]) -> bool {
        keys.iter().any(|key| self.has_option(key))
    }

    pub fn option_value(&self, key: &str) -> Option<&str> {
        self.options.get(key).and_then(|value| value.as_deref())
    }

    /// Redirect for `stream` (1 = output, 2 = error). `None` means the default sink.
    pub fn redirect_target(&self, stream: u32) -> Option<&RedirectTarget> {
        self.redirects.get(&stream)
    }

    pub fn redirect_targets(&self) -> &BTreeMap<u32, RedirectTarget> {
        &self.redirects
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> InputArgs {
        let mut options = HashMap::new();
        options.insert("-r".to_string(), None);
        options.insert("--depth".to_string(), Some("2".to_string()));
        let mut redirects = BTreeMap::new();
        redirects.insert(1, RedirectTarget::Append("log.txt".to_string()));
        InputArgs::new("cp", options, vec!["a".into(), "b".into()], redirects)
    }

    #[test]
    fn test_option_queries() {
        let input = sample();
        assert!(input.has_option("-r"));
        assert!(!input.has_option("-f"));
        assert!(input.has_any_option(&["-f", "--depth"]));
        assert_eq!(input.option_value("--depth"), Some("2"));
        assert_eq!(input.option_value("-r"), None);
    }

    #[test]
    fn test_options_is_a_copy() {
        let input = sample();
        let mut copy = input.options();
        copy.clear();
        assert!(input.has_option("-r"));
    }

    #[test]
    fn test_redirects() {
        let input = sample();
        let target = input.redirect_target(1).unwrap();
        assert!(target.is_append());
        assert_eq!(target.path(), "log.txt");
        assert!(input.redirect_target(2).is_none());
    }
}
