pub mod calibration;
pub mod decode;
pub mod google;
