pub use self::{
    billing_cycle::BillingCycle,
    push::{
        NotificationData, NotificationPayload, PushHeader, PushKeys,
        PushSubscriptionRequest, Urgency, VapidClaims,
    },
};

mod billing_cycle;
mod push;
