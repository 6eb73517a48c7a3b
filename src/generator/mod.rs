pub mod article;
pub mod cache;
pub mod pool;
pub mod prefetch;
pub mod wikipedia;

use crate::generator::article::Article;
use crate::generator::cache::FetchError;

/// Something that can produce a fresh practice article on demand.
pub trait ArticleSource: Send {
    fn fetch(&mut self) -> Result<Article, FetchError>;
}
