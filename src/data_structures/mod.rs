pub mod max_heap;
