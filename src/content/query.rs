//! Post queries
//!
//! Pure functions over borrowed posts. None of them allocate new posts or
//! mutate their input.

use super::Post;

/// Order posts by date, newest first.
///
/// The sort is stable: posts sharing a date keep their relative order.
pub fn sort_by_date<'a, I>(posts: I) -> Vec<&'a Post>
where
    I: IntoIterator<Item = &'a Post>,
{
    let mut sorted: Vec<&Post> = posts.into_iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}

/// Find the post whose `slug_as_params` equals the joined `segments`.
///
/// Returns the first match, or `None` when no post carries that slug.
pub fn find_by_slug<'a, I, S>(posts: I, segments: &[S]) -> Option<&'a Post>
where
    I: IntoIterator<Item = &'a Post>,
    S: AsRef<str>,
{
    let slug = segments
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("/");
    posts.into_iter().find(|post| post.slug_as_params == slug)
}

/// The `n` most recent posts, or all of them when there are fewer than `n`.
pub fn latest_n<'a, I>(posts: I, n: usize) -> Vec<&'a Post>
where
    I: IntoIterator<Item = &'a Post>,
{
    let mut sorted = sort_by_date(posts);
    sorted.truncate(n);
    sorted
}

/// One route parameter list per post, published or not.
pub fn static_params<'a, I>(posts: I) -> Vec<Vec<String>>
where
    I: IntoIterator<Item = &'a Post>,
{
    posts
        .into_iter()
        .map(|post| post.slug_as_params.split('/').map(str::to_string).collect())
        .collect()
}
