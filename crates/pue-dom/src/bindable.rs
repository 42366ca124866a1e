#![forbid(unsafe_code)]

//! Conversions between cell values and DOM property values.
//!
//! DOM properties are strings (`textContent`, `value`) or booleans
//! (`checked`). [`Bindable`] defines both directions for a cell's value type;
//! [`IntoCell`] lets binders accept an existing cell or a bare initial value.
//!
//! Truthiness follows the browser: `false`, zero, `NaN`, the empty string and
//! `None` are falsy, everything else is truthy.

use pue_core::{Cell, Computed, ReactiveConfig};

use crate::error::DomError;

/// A value that can be shown in, and read back from, a DOM element.
pub trait Bindable: Clone + PartialEq + 'static {
    /// Text written to `textContent`, `innerHTML` or `value`.
    fn to_text(&self) -> String;

    /// Value written to `checked`.
    fn is_truthy(&self) -> bool;

    /// Parse what the user typed into a text input.
    fn from_text(text: &str) -> Result<Self, DomError>;

    /// Value stored when the user toggles a checkbox.
    fn from_checked(checked: bool) -> Self;
}

impl Bindable for bool {
    fn to_text(&self) -> String {
        self.to_string()
    }

    fn is_truthy(&self) -> bool {
        *self
    }

    fn from_text(text: &str) -> Result<Self, DomError> {
        match text.trim() {
            t if t.eq_ignore_ascii_case("true") || t == "1" || t.eq_ignore_ascii_case("on") => {
                Ok(true)
            }
            t if t.is_empty()
                || t.eq_ignore_ascii_case("false")
                || t == "0"
                || t.eq_ignore_ascii_case("off") =>
            {
                Ok(false)
            }
            _ => Err(DomError::conversion(text, "bool")),
        }
    }

    fn from_checked(checked: bool) -> Self {
        checked
    }
}

impl Bindable for String {
    fn to_text(&self) -> String {
        self.clone()
    }

    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }

    fn from_text(text: &str) -> Result<Self, DomError> {
        Ok(text.to_owned())
    }

    fn from_checked(checked: bool) -> Self {
        checked.to_string()
    }
}

macro_rules! impl_bindable_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Bindable for $ty {
                fn to_text(&self) -> String {
                    self.to_string()
                }

                fn is_truthy(&self) -> bool {
                    *self != 0
                }

                fn from_text(text: &str) -> Result<Self, DomError> {
                    text.trim()
                        .parse()
                        .map_err(|_| DomError::conversion(text, stringify!($ty)))
                }

                fn from_checked(checked: bool) -> Self {
                    <$ty>::from(checked)
                }
            }
        )*
    };
}

impl_bindable_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! impl_bindable_float {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Bindable for $ty {
                fn to_text(&self) -> String {
                    self.to_string()
                }

                fn is_truthy(&self) -> bool {
                    *self != 0.0 && !self.is_nan()
                }

                fn from_text(text: &str) -> Result<Self, DomError> {
                    text.trim()
                        .parse()
                        .map_err(|_| DomError::conversion(text, stringify!($ty)))
                }

                fn from_checked(checked: bool) -> Self {
                    if checked { 1.0 } else { 0.0 }
                }
            }
        )*
    };
}

impl_bindable_float!(f32, f64);

impl<T: Bindable> Bindable for Option<T> {
    fn to_text(&self) -> String {
        self.as_ref().map(Bindable::to_text).unwrap_or_default()
    }

    fn is_truthy(&self) -> bool {
        self.as_ref().is_some_and(Bindable::is_truthy)
    }

    /// An empty input clears the value.
    fn from_text(text: &str) -> Result<Self, DomError> {
        if text.is_empty() {
            Ok(None)
        } else {
            T::from_text(text).map(Some)
        }
    }

    fn from_checked(checked: bool) -> Self {
        Some(T::from_checked(checked))
    }
}

/// Something a binder can bind: an existing cell (used as is) or a bare
/// value (wrapped in a new cell).
pub trait IntoCell<T> {
    fn into_cell(self, config: &ReactiveConfig) -> Cell<T>;
}

impl<T: Clone + PartialEq + 'static> IntoCell<T> for Cell<T> {
    fn into_cell(self, _config: &ReactiveConfig) -> Cell<T> {
        self
    }
}

impl<T: Clone + PartialEq + 'static> IntoCell<T> for &Cell<T> {
    fn into_cell(self, _config: &ReactiveConfig) -> Cell<T> {
        self.clone()
    }
}

impl<T: Clone + PartialEq + 'static> IntoCell<T> for Computed<T> {
    fn into_cell(self, _config: &ReactiveConfig) -> Cell<T> {
        self.cell().clone()
    }
}

impl<T: Clone + PartialEq + 'static> IntoCell<T> for &Computed<T> {
    fn into_cell(self, _config: &ReactiveConfig) -> Cell<T> {
        self.cell().clone()
    }
}

impl IntoCell<String> for &str {
    fn into_cell(self, config: &ReactiveConfig) -> Cell<String> {
        Cell::with_config(self.to_owned(), config)
    }
}

impl<T: Bindable> IntoCell<Option<T>> for Option<T> {
    fn into_cell(self, config: &ReactiveConfig) -> Cell<Option<T>> {
        Cell::with_config(self, config)
    }
}

macro_rules! impl_into_cell_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoCell<$ty> for $ty {
                fn into_cell(self, config: &ReactiveConfig) -> Cell<$ty> {
                    Cell::with_config(self, config)
                }
            }
        )*
    };
}

impl_into_cell_value!(
    bool, String, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness() {
        assert!(!false.is_truthy());
        assert!(!0i32.is_truthy());
        assert!(7u8.is_truthy());
        assert!(!f64::NAN.is_truthy());
        assert!(!0.0f32.is_truthy());
        assert!(!String::new().is_truthy());
        assert!("x".to_string().is_truthy());
        assert!(!None::<i32>.is_truthy());
        assert!(!Some(0i32).is_truthy());
        assert!(Some(true).is_truthy());
    }

    #[test]
    fn text_forms() {
        assert_eq!(1.0f64.to_text(), "1");
        assert_eq!(2.5f32.to_text(), "2.5");
        assert_eq!((-3i64).to_text(), "-3");
        assert_eq!(None::<u8>.to_text(), "");
        assert_eq!(true.to_text(), "true");
    }

    #[test]
    fn parse_numbers() {
        assert_eq!(i32::from_text(" 42 "), Ok(42));
        assert_eq!(
            u8::from_text("4x"),
            Err(DomError::conversion("4x", "u8"))
        );
        assert_eq!(f64::from_text("0.5"), Ok(0.5));
    }

    #[test]
    fn parse_bool() {
        assert_eq!(bool::from_text("on"), Ok(true));
        assert_eq!(bool::from_text(""), Ok(false));
        assert!(bool::from_text("maybe").is_err());
    }

    #[test]
    fn optional_values() {
        assert_eq!(Option::<i32>::from_text(""), Ok(None));
        assert_eq!(Option::<i32>::from_text("9"), Ok(Some(9)));
        assert_eq!(Option::<i32>::from_checked(true), Some(1));
    }

    #[test]
    fn from_checked_per_type() {
        assert_eq!(u32::from_checked(true), 1);
        assert_eq!(f64::from_checked(false), 0.0);
        assert_eq!(String::from_checked(true), "true");
    }

    #[test]
    fn into_cell_reuses_existing() {
        let config = ReactiveConfig::default();
        let cell = Cell::new(3);
        let reused = (&cell).into_cell(&config);
        assert!(reused.ptr_eq(&cell));

        let fresh = 3i32.into_cell(&config);
        assert!(!fresh.ptr_eq(&cell));
        assert_eq!(fresh.get(), 3);

        let text: Cell<String> = "hi".into_cell(&config);
        assert_eq!(text.get(), "hi");
    }
}
