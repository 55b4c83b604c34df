pub mod node;

pub use self::node::ContentNode;
