pub mod alert;
pub mod bar;
pub mod indicator;
pub mod snapshot;
pub mod trend;

pub use alert::*;
pub use bar::*;
pub use indicator::*;
pub use snapshot::*;
pub use trend::*;
