//! Place a watermark in the visually quietest region of an image.
//!
//! The base image is scored with a forward-energy map (the cost a seam
//! carver would charge for removing each pixel), the map is smoothed with
//! a wide Gaussian, and the overlay is alpha-blended over the global
//! minimum, scaled to one eighth of the shorter base side. Flat sky,
//! walls, and bokeh score low while faces, text, and texture score high,
//! so the watermark lands where it obscures the least.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use watermark_autoplace::{process_file, PlaceOptions};
//!
//! let report = process_file(
//!     Path::new("photo.jpg"),
//!     Path::new("logo.png"),
//!     &PlaceOptions::default(),
//! )
//! .expect("placement failed");
//! println!("wrote {}", report.output.display());
//! ```
//!
//! # In-memory use
//!
//! Decoded images can skip the file layer entirely:
//!
//! ```no_run
//! use watermark_autoplace::place_overlay;
//!
//! let mut base = image::open("photo.jpg").unwrap().to_rgb8();
//! let overlay = image::open("logo.png").unwrap().to_rgba8();
//! let placement = place_overlay(&mut base, &overlay).unwrap();
//! println!(
//!     "anchored at row {}, col {}",
//!     placement.anchor.row, placement.anchor.col
//! );
//! base.save("photo_watermarked.jpg").unwrap();
//! ```

#![deny(missing_docs)]

pub mod blending;
pub mod energy;
mod engine;
pub mod error;
pub mod grid;
pub mod locate;

pub use blending::Rect;
pub use engine::{
    default_output_path, place_overlay, process_file, save_image, PlaceOptions, PlaceReport,
    Placement,
};
pub use error::{Error, Result};
pub use locate::Coord;
