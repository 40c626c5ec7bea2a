mod catalog;
mod collaborate;
mod enquiries;
mod server;
mod support;
mod users;
