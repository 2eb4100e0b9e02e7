pub mod connect;
pub mod context;
pub mod disconnect;
pub mod dispatcher;
pub mod send_message;
pub mod ws_response;
