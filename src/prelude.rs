pub use crate::application::prelude::*;
pub use crate::errors::{Error, Result};
pub use crate::math::prelude::*;
pub use crate::shader::prelude::*;
pub use crate::video::prelude::*;
pub use crate::window::prelude::*;
