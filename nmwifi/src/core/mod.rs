//! Wi-Fi operations expressed against [`NmBus`](crate::NmBus).

pub(crate) mod clock;
pub(crate) mod connection;
pub(crate) mod disconnect;
pub(crate) mod resolver;
pub(crate) mod scan;
