pub mod agent;
pub mod echelon;
pub mod queues;
