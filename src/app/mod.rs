pub mod movie_store;
