
mod sync;
