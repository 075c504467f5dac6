pub const SYSEX_START: u8 = 0xF0;
pub const SYSEX_END: u8 = 0xF7;
