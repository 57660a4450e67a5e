//! Positional call arguments addressed by declared name.

use super::error::ArgError;
use std::fmt;

/// The positional values of one call, paired with the names the transition
/// declared for them.
///
/// Hooks receive a `CallArgs` and look values up by name:
///
/// ```rust
/// use mailbox_fsm::transition::{ArgError, CallArgs};
///
/// let names = vec!["user".to_string(), "reason".to_string()];
/// let args = CallArgs::new(Some(names.as_slice()), &["alice", "timeout"]);
///
/// assert_eq!(args.get("reason"), Ok(&"timeout"));
/// assert!(matches!(args.get("missing"), Err(ArgError::InvalidArgument { .. })));
/// ```
pub struct CallArgs<'a, A> {
    names: Option<&'a [String]>,
    values: &'a [A],
}

impl<'a, A> CallArgs<'a, A> {
    pub const fn new(names: Option<&'a [String]>, values: &'a [A]) -> Self {
        Self { names, values }
    }

    /// Value bound to `name`.
    ///
    /// Declared names are paired with values in order; the first name that
    /// matches wins. Names past the last provided value have no binding.
    pub fn get(&self, name: &str) -> Result<&'a A, ArgError> {
        lookup(self.names, self.values, name)
    }

    pub fn values(&self) -> &'a [A] {
        self.values
    }

    pub fn names(&self) -> Option<&'a [String]> {
        self.names
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<A> Clone for CallArgs<'_, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A> Copy for CallArgs<'_, A> {}

impl<A: fmt::Debug> fmt::Debug for CallArgs<'_, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallArgs")
            .field("names", &self.names)
            .field("values", &self.values)
            .finish()
    }
}

pub(crate) fn lookup<'a, A>(
    names: Option<&[String]>,
    values: &'a [A],
    name: &str,
) -> Result<&'a A, ArgError> {
    let names = names.ok_or(ArgError::NoArgsSpecified)?;
    names
        .iter()
        .zip(values)
        .find(|(declared, _)| declared.as_str() == name)
        .map(|(_, value)| value)
        .ok_or_else(|| ArgError::InvalidArgument {
            name: name.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn lookup_without_declared_names_fails() {
        let args = CallArgs::new(None, &[1, 2]);
        assert_eq!(args.get("a"), Err(ArgError::NoArgsSpecified));
    }

    #[test]
    fn lookup_pairs_names_with_positions() {
        let declared = names(&["a", "b"]);
        let args = CallArgs::new(Some(declared.as_slice()), &[10, 20]);

        assert_eq!(args.get("a"), Ok(&10));
        assert_eq!(args.get("b"), Ok(&20));
    }

    #[test]
    fn first_matching_name_wins() {
        let declared = names(&["x", "x"]);
        let args = CallArgs::new(Some(declared.as_slice()), &["first", "second"]);

        assert_eq!(args.get("x"), Ok(&"first"));
    }

    #[test]
    fn declared_name_without_value_is_invalid() {
        let declared = names(&["a", "b"]);
        let args = CallArgs::new(Some(declared.as_slice()), &[10]);

        assert_eq!(
            args.get("b"),
            Err(ArgError::InvalidArgument {
                name: "b".to_string()
            })
        );
    }

    #[test]
    fn undeclared_name_is_invalid() {
        let declared = names(&["a"]);
        let args = CallArgs::new(Some(declared.as_slice()), &[10]);

        assert!(matches!(
            args.get("z"),
            Err(ArgError::InvalidArgument { name }) if name == "z"
        ));
    }
}
