pub mod outfit;
pub mod sneaker;
pub mod trend;
pub mod upload;
pub mod wardrobe;
