/// Declares a static enumerator.
///
/// This macro creates two items:
/// - A `&str` constant with the suffix `_NAME` holding the canonical name
/// - A constructor function named after the constant in lower case
///
/// # Examples
///
/// ```
/// use enumerators::{enumerator, Enumeration, Registry};
///
/// enumerator!(1, ACTIVE, "ACTIVE", "Currently active", "on", "enabled");
/// enumerator!(0, INACTIVE, "INACTIVE", "Not active");
///
/// assert_eq!(ACTIVE_NAME, "ACTIVE");
/// assert!(active().has_alias("ON"));
///
/// let registry = Registry::new([active(), inactive()]);
/// assert_eq!(registry.get_by_name(INACTIVE_NAME).unwrap().description(), "Not active");
/// ```
#[macro_export]
macro_rules! enumerator {
    ($value:expr, $const_name:ident, $name:expr, $description:expr $(, $alias:expr)* $(,)?) => {
        $crate::paste::paste! {
            pub const [<$const_name _NAME>]: &str = $name;

            pub fn [<$const_name:lower>]() -> $crate::Enumerator {
                $crate::Enumerator::new($value, $name, $description)
                    $(.with_alias($alias))*
            }
        }
    };
}
