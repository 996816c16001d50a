#[macro_export(local_inner_macros)]
macro_rules! call_batch_fn {
    ($self:ident, $data:ident, $batch_fn:expr) => {
        let all_count = $data.len();
        let mut sinked_count = 0;

        loop {
            let mut batch_size = $self.batch_size;
            if all_count - sinked_count < batch_size {
                batch_size = all_count - sinked_count;
            }

            if batch_size == 0 {
                break;
            }

            $batch_fn($self, &mut $data, sinked_count, batch_size).await?;
            sinked_count += batch_size;
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::call_batch_fn;

    struct MockSinker {
        batch_size: usize,
        batches: Vec<usize>,
    }

    impl MockSinker {
        async fn batch_insert(
            &mut self,
            _data: &mut [u32],
            _start_index: usize,
            batch_size: usize,
        ) -> anyhow::Result<()> {
            self.batches.push(batch_size);
            Ok(())
        }
    }

    async fn run_batches(row_count: usize, batch_size: usize) -> anyhow::Result<Vec<usize>> {
        let mut mock = MockSinker {
            batch_size,
            batches: Vec::new(),
        };
        let sinker = &mut mock;
        let mut data: Vec<u32> = (0..row_count as u32).collect();
        call_batch_fn!(sinker, data, MockSinker::batch_insert);
        Ok(mock.batches)
    }

    #[tokio::test]
    async fn test_250_rows_at_batch_size_100() {
        let batches = run_batches(250, 100).await.unwrap();
        assert_eq!(batches, vec![100, 100, 50]);
    }

    #[tokio::test]
    async fn test_exact_multiple_has_no_trailing_batch() {
        let batches = run_batches(200, 100).await.unwrap();
        assert_eq!(batches, vec![100, 100]);
    }

    #[tokio::test]
    async fn test_fewer_rows_than_batch_size() {
        let batches = run_batches(7, 100).await.unwrap();
        assert_eq!(batches, vec![7]);
    }

    #[tokio::test]
    async fn test_no_rows_no_batches() {
        let batches = run_batches(0, 100).await.unwrap();
        assert!(batches.is_empty());
    }
}
