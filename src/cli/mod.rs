//! # CLI Module
//!
//! Command implementations behind the `moodlist` binary.
//!
//! - [`serve`] - loads the configuration and runs the web application
//! - [`moods`] - prints the feature bands and recommendation seeds per mood
//! - [`secret`] - prints a fresh value for `SESSION_SECRET`
//!
//! ## Usage
//!
//! ```bash
//! moodlist secret >> .env               # once, then edit the remaining values
//! moodlist serve                        # listens on SERVER_ADDRESS
//! moodlist serve --address 127.0.0.1:8080
//! moodlist moods                        # show what each mood selects
//! ```
//!
//! Startup failures are reported with the fatal `error!` macro and end the
//! process with exit code 1.

mod moods;
mod secret;
mod serve;

pub use moods::mood_rows;
pub use moods::moods;
pub use secret::secret;
pub use serve::serve;
