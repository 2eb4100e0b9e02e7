mod dispatcher;
mod send_message;
