// FCM multicast limit
pub const MAX_BATCH_SIZE: usize = 500;

pub fn split_batches<T>(items: &[T], max_size: usize) -> Vec<&[T]> {
    let max_size = max_size.max(1);
    if items.len() <= max_size {
        return vec![items];
    }
    items.chunks(max_size).collect()
}

pub fn batch_count(len: usize, max_size: usize) -> usize {
    len.div_ceil(max_size.max(1)).max(1)
}
