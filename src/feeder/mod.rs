//! Feeder-level operations on parsed trees.
//!
//! These are the edits the surrounding application makes between parsing a
//! feeder and handing it to the solver: flattening nested blocks, moving the
//! simulation window, attaching measurement recorders and reading the
//! topology back out of cross-references.

mod embedded;
mod recorders;
mod timing;
mod topology;

pub use embedded::{de_embed_once, fully_de_embed};
pub use recorders::{attach_recorders, group_swing_kids, RecorderKind, RecorderTemplate, SWING_GROUP};
pub use timing::{adjust_time, TimeUnit};
pub use topology::{dangling_names, links, Link, LinkKind, FROM, TO};
