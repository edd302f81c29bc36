mod hash_test;
