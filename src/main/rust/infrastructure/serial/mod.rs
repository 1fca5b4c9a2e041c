mod line_connection;
mod serial_transport;

pub use line_connection::LineReaderConnection;
pub use serial_transport::SerialLineTransport;
