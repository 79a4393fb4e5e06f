pub mod example;
pub mod skills;

pub use example::{EncodedExample, SkillExample};
pub use skills::{parse_skill_list, parse_skill_str};
