//! Options for heapview views.
//!
//! Options can be set in two ways:
//! * from environment variables with the prefix `HEAPVIEW_`, e.g. `HEAPVIEW_PRINT_SIZE_UNIT=K`.
//!   These are picked up by [`Options::default`].
//! * programmatically with [`Options::set_from_str`], or by assigning the public fields.

use strum_macros::{Display, EnumString};

/// The unit used for byte figures in diagnostic output.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum SizeUnit {
    B,
    K,
    M,
    G,
}

fn always_valid<T>(_: &T) -> bool {
    true
}

/// The prefix of environment variables that set options.
pub const ENV_PREFIX: &str = "HEAPVIEW_";

macro_rules! options {
    ($($(#[$outer:meta])* $name:ident: $type:ty[$validator:expr] = $default:expr),*,) => [
        options!($($(#[$outer])* $name: $type[$validator] = $default),*);
    ];
    ($($(#[$outer:meta])* $name:ident: $type:ty[$validator:expr] = $default:expr),*) => [
        #[derive(Clone, Debug)]
        pub struct Options {
            $($(#[$outer])* pub $name: $type),*
        }
        impl Options {
            /// Set an option by its name from a string value. Returns false and keeps the
            /// current value if the name is unknown, or the value cannot be parsed or is invalid.
            pub fn set_from_str(&mut self, s: &str, val: &str) -> bool {
                match s {
                    // Parse the given value from str (by env vars or by calling set_from_str()) to the right type
                    $(stringify!($name) => if let Ok(ref val) = val.parse::<$type>() {
                        // Validate
                        let validate_fn = $validator;
                        let is_valid = validate_fn(val);
                        if is_valid {
                            // Only set value if valid.
                            self.$name = val.clone();
                        } else {
                            warn!("Unable to set {}={:?}. Invalid value. The current value will be used.", s, val);
                        }
                        is_valid
                    } else {
                        warn!("Unable to set {}={:?}. Can't parse value. The current value will be used.", s, val);
                        false
                    })*
                    _ => {
                        warn!("Unknown option {}", s);
                        false
                    }
                }
            }

            /// Options with the built-in defaults only, ignoring the environment.
            pub fn builtin() -> Self {
                Options {
                    $($name: $default),*
                }
            }

            /// Apply every `HEAPVIEW_*` pair from the given iterator that matches an option.
            pub fn read_env_var_settings<I: IntoIterator<Item = (String, String)>>(&mut self, vars: I) {
                for (key, val) in vars {
                    // strip the prefix, and get the lower case string
                    if let Some(rest_of_key) = key.strip_prefix(ENV_PREFIX) {
                        let lowercase: &str = &rest_of_key.to_lowercase();
                        match lowercase {
                            $(stringify!($name) => { self.set_from_str(lowercase, &val); },)*
                            _ => {}
                        }
                    }
                }
            }
        }
        impl Default for Options {
            /// The built-in defaults, overridden by `HEAPVIEW_*` environment variables.
            fn default() -> Self {
                let mut options = Self::builtin();
                options.read_env_var_settings(std::env::vars());
                options
            }
        }
    ]
}

options! {
    /// The unit for byte figures printed by `print_on`.
    print_size_unit:     SizeUnit [always_valid] = SizeUnit::B,
    /// Check `bottom <= top <= end` whenever a space is read from the target.
    verify_space_bounds: bool     [always_valid] = true,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn builtin_defaults() {
        let options = Options::builtin();
        assert_eq!(options.print_size_unit, SizeUnit::B);
        assert!(options.verify_space_bounds);
    }

    #[test]
    fn set_from_str() {
        let mut options = Options::builtin();
        assert!(options.set_from_str("print_size_unit", "k"));
        assert_eq!(options.print_size_unit, SizeUnit::K);
        assert!(options.set_from_str("verify_space_bounds", "false"));
        assert!(!options.verify_space_bounds);
    }

    #[test]
    fn set_from_str_rejects_bad_values() {
        let mut options = Options::builtin();
        assert!(!options.set_from_str("print_size_unit", "T"));
        assert_eq!(options.print_size_unit, SizeUnit::B);
        assert!(!options.set_from_str("verify_space_bounds", "maybe"));
        assert!(options.verify_space_bounds);
        assert!(!options.set_from_str("no_such_option", "1"));
    }

    #[test]
    fn env_var_settings() {
        let mut options = Options::builtin();
        options.read_env_var_settings(vars(&[
            ("HEAPVIEW_PRINT_SIZE_UNIT", "M"),
            ("HEAPVIEW_VERIFY_SPACE_BOUNDS", "false"),
            ("PRINT_SIZE_UNIT", "G"),
            ("HEAPVIEW_UNRELATED", "1"),
        ]));
        assert_eq!(options.print_size_unit, SizeUnit::M);
        assert!(!options.verify_space_bounds);
    }
}
