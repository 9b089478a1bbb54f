// Domain layer：AID 群組記錄與其邊界上的 trait。

pub mod model;
pub mod ports;
