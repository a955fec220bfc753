//! av-plot: turns plot parameters and dataset geometry into a fully resolved
//! rendering configuration.
//!
//! # Architecture
//!
//! Resolution is pure: [`Planner::plan`] reads a [`av_dataset::Dataset`] and a
//! [`av_params::PlotParams`] and produces a [`RenderPlan`], either a
//! [`ResolvedPlot`] (slice/projection) or a [`VolumeScene`]. Drawing pixels is
//! the job of a [`Renderer`] implementation, which receives the plan in one
//! piece. [`Plotter`] glues the two together and is the single entry point
//! for callers.
//!
//! # Example
//!
//! ```no_run
//! use av_dataset::{Axis, Dataset};
//! use av_params::{PlotConfig, PlotParams};
//! use av_plot::{Planner, PlotRequest};
//!
//! let dataset = Dataset::open("plt00020.yaml".as_ref()).unwrap();
//! let config = PlotConfig::default();
//! let plan = Planner::new(&dataset, &config)
//!     .plan(&PlotRequest::slice(Axis::Z, "density").with_params(PlotParams::default()))
//!     .unwrap();
//! println!("{plan:?}");
//! ```

pub mod annotate;
pub mod camera;
pub mod color;
pub mod error;
pub mod layout;
pub mod plotter;
pub mod render;
pub mod resolve;
pub mod transfer;
pub mod volume;

pub use annotate::{Annotation, Corner, HAlign, ScaleBar, ScaleLength, VAlign};
pub use camera::{CameraGeometry, Lens};
pub use color::{ColorRange, Limit};
pub use error::{PlotError, PlotResult};
pub use layout::{FigureLayout, figure_size, is_close_to_square, scale_bar_anchor};
pub use plotter::{FieldInfo, Planner, PlotKind, PlotRequest, Plotter, RenderPlan};
pub use render::{RenderError, Renderer};
pub use resolve::{ColorbarSpec, PlaneSelection, PlotResolver, PlotWidth, ResolvedPlot};
pub use transfer::{TransferBounds, TransferFunction, TransferLayer};
pub use volume::{BoxFrame, VolumeScene};
