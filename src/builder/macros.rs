//! Macros for ergonomic state machine construction.

/// Generate a state enum together with its [`State`](crate::core::State)
/// implementation.
///
/// The enum derives everything the machine needs (`Clone`, `Copy`, `Eq`,
/// `Hash`, `Debug`, serde) so variants can be used as map keys directly.
///
/// # Example
///
/// ```
/// use mailbox_fsm::state_enum;
/// use mailbox_fsm::core::State;
///
/// state_enum! {
///     pub enum Brew {
///         Empty,
///         Ready,
///         On,
///         Broken,
///     }
///     final: [Broken]
///     error: [Broken]
/// }
///
/// assert_eq!(Brew::Ready.name(), "Ready");
/// assert!(Brew::Broken.is_error());
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }

        $(final: [$($final:ident),* $(,)?])?
        $(error: [$($error:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            Debug,
            serde::Serialize,
            serde::Deserialize
        )]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            fn is_final(&self) -> bool {
                match self {
                    $($(Self::$final => true,)*)?
                    #[allow(unreachable_patterns)]
                    _ => false,
                }
            }

            fn is_error(&self) -> bool {
                match self {
                    $($(Self::$error => true,)*)?
                    #[allow(unreachable_patterns)]
                    _ => false,
                }
            }
        }
    };
}

/// Build a [`TransitionMap`](crate::transition::TransitionMap) from
/// `from => to` pairs.
///
/// # Panics
///
/// Panics if a source state appears more than once, matching
/// [`BuildError::DuplicateSource`](crate::builder::BuildError::DuplicateSource)
/// from the transition builder.
///
/// ```
/// use mailbox_fsm::{state_enum, transition_map};
/// use mailbox_fsm::transition::TransitionMap;
///
/// state_enum! {
///     enum Light {
///         Red,
///         Green,
///     }
/// }
///
/// let map: TransitionMap<Light> = transition_map! {
///     Light::Red => Light::Green,
///     Light::Green => Light::Red,
/// };
/// assert_eq!(map[&Light::Red], Light::Green);
/// ```
#[macro_export]
macro_rules! transition_map {
    () => {
        ::std::collections::HashMap::new()
    };
    ($($from:expr => $to:expr),+ $(,)?) => {{
        let mut map = ::std::collections::HashMap::new();
        $(
            let from = $from;
            let label = ::std::format!("{:?}", from);
            if map.insert(from, $to).is_some() {
                ::std::panic!("transition_map!: state {} is mapped more than once", label);
            }
        )+
        map
    }};
}
