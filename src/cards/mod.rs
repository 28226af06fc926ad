pub mod model;
pub mod policy;
pub mod service;

pub use model::{DebitCard, DebitCardTransaction};
pub use policy::DebitCardPolicy;
pub use service::DebitCardService;
