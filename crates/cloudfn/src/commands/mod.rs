pub mod all;
pub mod delete;
pub mod only;
