// Loaded character handle: skeleton, humanoid bone map and expression weights.

pub mod character;
pub mod expression;
pub mod humanoid;
pub mod skeleton;

pub use character::Character;
pub use expression::ExpressionManager;
pub use humanoid::HumanBone;
pub use skeleton::{Bone, Skeleton};
