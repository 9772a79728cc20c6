pub mod pinterest;
