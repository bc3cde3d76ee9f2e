//! Pure parsing stages for Markdown-to-Notion upload.
//!
//! Each submodule implements exactly one transformation step and performs
//! no network I/O, so each is testable without the HTTP collaborators.
//!
//! ## Data Flow
//!
//! ```text
//! line ──▶ lines ──┬─▶ spans   (paragraph → Vec<RichSpan>)
//!                  ├─▶ images  (![alt](target) → URL / local path)
//!                  └─▶ EquationAccumulator ($$ … $$)
//! ```
//!
//! 1. [`lines`]  — classify one trimmed line; hold the open equation
//! 2. [`spans`]  — tokenize paragraph text into bold / inline-math / plain
//! 3. [`images`] — resolve an image target against cwd and the file's dir

pub mod images;
pub mod lines;
pub mod spans;
