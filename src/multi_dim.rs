mod array;
mod shape;

pub use array::MultiDim;
