pub mod status_code {
    pub const OK: u16 = 200;
    pub const NOT_FOUND: u16 = 404;
    pub const GATEWAY_TIMEOUT: u16 = 504;
    pub const INTERNAL_SERVER_ERROR: u16 = 500;
}
