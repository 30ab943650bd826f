pub mod mock_forum;
