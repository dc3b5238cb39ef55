mod common;
mod page;
mod routing;
mod service;
