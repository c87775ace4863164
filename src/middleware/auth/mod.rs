pub mod jwt_filter;
