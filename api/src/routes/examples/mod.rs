pub mod examples_route;
