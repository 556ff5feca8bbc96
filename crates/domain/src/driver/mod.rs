mod read_mode;
mod resolver;
mod scale_connection;

pub use read_mode::ReadMode;
pub use resolver::ConnectionResolver;
pub use scale_connection::ScaleConnection;
