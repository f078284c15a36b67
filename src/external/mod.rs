pub mod google_maps;
pub mod polyline;
pub mod retry;
pub mod viacep;
