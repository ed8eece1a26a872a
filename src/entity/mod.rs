pub mod conversations;
pub mod messages;
pub mod users;

pub use conversations::Entity as Conversations;
pub use messages::Entity as Messages;
pub use users::Entity as Users;
