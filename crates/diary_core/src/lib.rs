pub mod domain;
pub mod ports;

pub use domain::{
    tag_aggregates, DiaryDocument, DiaryRecord, NewUser, TagAggregates, User, UserCredentials,
};
pub use ports::{DiaryStore, Mailer, PortError, PortResult};
