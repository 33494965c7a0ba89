//! Statistics pretty-printing for either engine (spec.md §4.3, §4.5).

use crate::engine::AnyStatistics;

pub fn print(stats: &AnyStatistics) {
    match stats {
        AnyStatistics::Tree(s) => {
            println!("height:        {}", s.height);
            println!("num_nodes:     {}", s.num_nodes);
            println!("num_leaf_nodes:{}", s.num_leaf_nodes);
            println!("num_records:   {}", s.num_records);
        }
        AnyStatistics::Hash(s) => {
            println!("num_buckets:         {}", s.num_buckets);
            println!("num_records:         {}", s.num_records);
            println!("level:               {}", s.level);
            println!("next_split:          {}", s.next_split);
            println!("num_splits:          {}", s.num_splits);
            println!("total_overflow_pages:{}", s.total_overflow_pages);
            println!("overflow_pages_per_bucket:{:?}", s.overflow_pages_per_bucket);
            println!("mean_occupancy:      {:.3}", s.mean_occupancy);
        }
    }
}
