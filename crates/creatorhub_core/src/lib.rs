pub mod domain;
pub mod ports;

pub use domain::{
    Channel, ChannelInfo, CurrentPlan, Deal, DealPaymentStatus, DealStatus, Mission, Payment,
    PaymentStatus, Plan, PlanCustomization, PlanRef, Review, User, YoutubeInfo,
};
pub use ports::{Store, StoreError, StoreResult};
