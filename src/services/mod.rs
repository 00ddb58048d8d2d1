pub mod ors;
pub mod route_generator;
pub mod routing;
