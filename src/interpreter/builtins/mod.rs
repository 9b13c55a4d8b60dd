//! Built-in forms of the language.
//!
//! - **IO**: `print` line assembly and `inquire` (prompted input with numeric coercion)
//! - **Tribute**: `parias`, a random tax levied on a numeric variable
//! - **Conquest**: `conquistar`, a battle that may cost the army soldiers
//!
//! Each built-in narrates what it does through the interpreter's console.

pub mod conquest;
pub mod io;
pub mod tribute;

pub use conquest::{battle, troops, Army};
pub use io::{coerce_input, inquire, print_line};
pub use tribute::levy;

/// Writes one formatted line to a console, turning write failures into
/// interpreter errors.
macro_rules! narrate {
    ($console:expr, $($arg:tt)*) => {
        $console.write_line(&format!($($arg)*))?
    };
}

pub(crate) use narrate;
