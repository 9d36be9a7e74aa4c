pub mod respond_request;
pub mod respond_route;
